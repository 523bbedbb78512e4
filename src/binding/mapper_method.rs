use log::trace;

use crate::binding::command::SqlCommand;
use crate::binding::signature::{MethodSignature, ReturnShape};
use crate::core::{Arg, BindingError, Result, Value};
use crate::mapping::CommandType;
use crate::metadata::{MapperInterface, MethodDecl};
use crate::reflection::TypeExpr;
use crate::session::{CallResult, Configuration, SqlSession};

/// A fully compiled dispatcher for one mapper method: the resolved command
/// plus the classified signature. Built once, then immutable.
pub struct MapperMethod {
    id: String,
    command: SqlCommand,
    signature: MethodSignature,
}

impl MapperMethod {
    pub fn new(
        config: &Configuration,
        mapper: &MapperInterface,
        declaring: &MapperInterface,
        method: &MethodDecl,
    ) -> Result<Self> {
        let command = SqlCommand::resolve(config, mapper, method, declaring)?;
        let signature = MethodSignature::new(config, mapper, declaring, method)?;
        Ok(Self {
            id: format!("{}.{}", mapper.name(), method.name),
            command,
            signature,
        })
    }

    pub fn command(&self) -> &SqlCommand {
        &self.command
    }

    pub fn signature(&self) -> &MethodSignature {
        &self.signature
    }

    /// Execute the call: build the named parameter, dispatch on command type
    /// and return shape, adapt the engine result.
    pub fn execute(&self, session: &dyn SqlSession, mut args: Vec<Arg>) -> Result<CallResult> {
        trace!("dispatching {} as {}", self.id, self.command.command_type());
        let result = match &self.command {
            SqlCommand::Flush => CallResult::Batch(session.flush_statements()?),
            SqlCommand::Mapped { name, command_type } => match command_type {
                CommandType::Insert => {
                    let param = self.signature.convert_args_to_command_param(&args)?;
                    self.row_count_result(session.insert(name, &param)?)?
                }
                CommandType::Update => {
                    let param = self.signature.convert_args_to_command_param(&args)?;
                    self.row_count_result(session.update(name, &param)?)?
                }
                CommandType::Delete => {
                    let param = self.signature.convert_args_to_command_param(&args)?;
                    self.row_count_result(session.delete(name, &param)?)?
                }
                CommandType::Select => self.execute_select(session, name, &mut args)?,
                CommandType::Flush => CallResult::Batch(session.flush_statements()?),
                CommandType::Unknown => {
                    return Err(BindingError::UnknownCommandType(name.clone()));
                }
            },
        };

        if result.is_absent()
            && self.signature.return_type().is_primitive()
            && self.signature.shape() != ReturnShape::Void
        {
            return Err(BindingError::NullForPrimitive(self.name_for_errors()));
        }
        Ok(result)
    }

    fn execute_select(
        &self,
        session: &dyn SqlSession,
        name: &str,
        args: &mut Vec<Arg>,
    ) -> Result<CallResult> {
        match self.signature.shape() {
            ReturnShape::Void if self.signature.has_row_handler() => {
                self.execute_with_handler(session, name, args)?;
                Ok(CallResult::absent())
            }
            ReturnShape::Many => self.execute_for_many(session, name, args),
            ReturnShape::Map => self.execute_for_map(session, name, args),
            ReturnShape::Cursor => {
                let param = self.signature.convert_args_to_command_param(args)?;
                let bounds = self.signature.extract_row_bounds(args);
                Ok(CallResult::Cursor(session.select_cursor(
                    name, &param, bounds,
                )?))
            }
            _ => {
                let param = self.signature.convert_args_to_command_param(args)?;
                let row = session.select_one(name, &param)?;
                // Null doubles as the empty optional container; a present row
                // is passed through untouched
                Ok(CallResult::Value(row.unwrap_or(Value::Null)))
            }
        }
    }

    fn execute_with_handler(
        &self,
        session: &dyn SqlSession,
        name: &str,
        args: &mut Vec<Arg>,
    ) -> Result<()> {
        let config = session.configuration();
        let descriptor = config
            .get_command(name)
            .ok_or_else(|| BindingError::CommandNotFound(name.to_string()))?;
        if !descriptor.procedure && !descriptor.has_result_shape {
            return Err(BindingError::MissingResultShape(name.to_string()));
        }

        let param = self.signature.convert_args_to_command_param(args)?;
        let bounds = self.signature.extract_row_bounds(args);
        let handler = self.signature.extract_row_handler(args)?;
        session.select_with_handler(name, &param, bounds, handler)
    }

    fn execute_for_many(
        &self,
        session: &dyn SqlSession,
        name: &str,
        args: &[Arg],
    ) -> Result<CallResult> {
        let param = self.signature.convert_args_to_command_param(args)?;
        let bounds = self.signature.extract_row_bounds(args);
        let rows = session.select_list(name, &param, bounds)?;

        let declared = self.signature.return_type();
        let value = match declared {
            TypeExpr::List(_) => Value::List(rows),
            TypeExpr::Array(element) => self.convert_to_array(element, rows)?,
            _ => {
                let factory = session.configuration().factory().clone();
                let mut container = factory.create(declared)?;
                factory.bulk_append(&mut container, rows)?;
                container
            }
        };
        Ok(CallResult::Value(value))
    }

    /// Element-by-element conversion into a dense primitive array; reference
    /// element types are bulk-copied as a list.
    fn convert_to_array(&self, element: &TypeExpr, rows: Vec<Value>) -> Result<Value> {
        match element {
            TypeExpr::Int | TypeExpr::Long => {
                let mut out = Vec::with_capacity(rows.len());
                for row in &rows {
                    out.push(row.as_i64().ok_or_else(|| self.array_mismatch(element, row))?);
                }
                Ok(Value::IntArray(out))
            }
            TypeExpr::Double => {
                let mut out = Vec::with_capacity(rows.len());
                for row in &rows {
                    out.push(row.as_f64().ok_or_else(|| self.array_mismatch(element, row))?);
                }
                Ok(Value::FloatArray(out))
            }
            TypeExpr::Bool => {
                let mut out = Vec::with_capacity(rows.len());
                for row in &rows {
                    out.push(row.as_bool().ok_or_else(|| self.array_mismatch(element, row))?);
                }
                Ok(Value::BoolArray(out))
            }
            _ => Ok(Value::List(rows)),
        }
    }

    fn array_mismatch(&self, element: &TypeExpr, row: &Value) -> BindingError {
        BindingError::TypeMismatch(format!(
            "cannot store {} into a {}[] result for '{}'",
            row.type_name(),
            element,
            self.id
        ))
    }

    fn execute_for_map(
        &self,
        session: &dyn SqlSession,
        name: &str,
        args: &[Arg],
    ) -> Result<CallResult> {
        let map_key = self.signature.map_key().ok_or_else(|| {
            BindingError::TypeMismatch(format!("method '{}' declares no map key", self.id))
        })?;
        let param = self.signature.convert_args_to_command_param(args)?;
        let bounds = self.signature.extract_row_bounds(args);
        let entries = session.select_map(name, &param, map_key, bounds)?;
        Ok(CallResult::Value(Value::Map(entries)))
    }

    /// Adapt a mutation row count to the declared return shape.
    fn row_count_result(&self, row_count: usize) -> Result<CallResult> {
        let value = match self.signature.return_type() {
            TypeExpr::Unit => Value::Null,
            TypeExpr::Int => Value::Integer(row_count as i64),
            TypeExpr::Long => Value::Integer(row_count as i64),
            TypeExpr::Bool => Value::Boolean(row_count > 0),
            declared => {
                return Err(BindingError::UnsupportedReturnType {
                    method: self.name_for_errors(),
                    declared: declared.to_string(),
                });
            }
        };
        Ok(CallResult::Value(value))
    }

    fn name_for_errors(&self) -> String {
        self.command
            .name()
            .map(str::to_string)
            .unwrap_or_else(|| self.id.clone())
    }
}
