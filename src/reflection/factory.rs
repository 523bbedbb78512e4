use crate::core::{BindingError, Result, Value};
use crate::reflection::types::TypeExpr;

/// Instantiates declared collection containers and fills them in bulk.
///
/// The dispatcher calls into this when the engine's native sequence is not
/// assignable to a method's declared collection type.
pub trait ObjectFactory: Send + Sync {
    /// Create an empty container for the declared type.
    fn create(&self, declared: &TypeExpr) -> Result<Value>;

    /// Append a produced sequence into a container created by `create`.
    fn bulk_append(&self, container: &mut Value, rows: Vec<Value>) -> Result<()>;

    /// Whether the declared type is a collection (arrays are classified
    /// separately by the signature).
    fn is_collection(&self, declared: &TypeExpr) -> bool;
}

#[derive(Debug, Default)]
pub struct DefaultObjectFactory;

impl ObjectFactory for DefaultObjectFactory {
    fn create(&self, declared: &TypeExpr) -> Result<Value> {
        match declared {
            TypeExpr::List(_) => Ok(Value::List(Vec::new())),
            TypeExpr::Set(_) => Ok(Value::Set(Vec::new())),
            TypeExpr::Map(..) => Ok(Value::Map(Vec::new())),
            other => Err(BindingError::TypeMismatch(format!(
                "cannot instantiate non-collection type: {}",
                other
            ))),
        }
    }

    fn bulk_append(&self, container: &mut Value, rows: Vec<Value>) -> Result<()> {
        match container {
            Value::List(items) => {
                items.extend(rows);
                Ok(())
            }
            Value::Set(items) => {
                // insertion order preserved, duplicates dropped
                for row in rows {
                    if !items.contains(&row) {
                        items.push(row);
                    }
                }
                Ok(())
            }
            other => Err(BindingError::TypeMismatch(format!(
                "cannot bulk-append into {}",
                other.type_name()
            ))),
        }
    }

    fn is_collection(&self, declared: &TypeExpr) -> bool {
        matches!(declared, TypeExpr::List(_) | TypeExpr::Set(_))
    }
}
