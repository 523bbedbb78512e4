use std::sync::Arc;

use rustmapper::{
    Arg, BindingError, CallResult, CommandDescriptor, CommandType, Configuration, MapperFactory,
    MapperInterface, MemorySession, MethodDecl, Param, ParamDecl, SqlSession, TypeExpr, Value,
};

fn user_row(id: i64, name: &str) -> Value {
    Value::Record(vec![
        ("id".to_string(), Value::Integer(id)),
        ("name".to_string(), Value::Text(name.to_string())),
    ])
}

#[test]
fn test_descendant_inherits_ancestor_command() {
    let config = Arc::new(Configuration::new().command(CommandDescriptor::new(
        "app.BaseMapper.findById",
        CommandType::Select,
    )));
    let base = MapperInterface::new("app.BaseMapper")
        .method(
            MethodDecl::new("findById")
                .param(ParamDecl::value("id"))
                .returns(TypeExpr::named("User")),
        )
        .build();
    let child = MapperInterface::new("app.ChildMapper")
        .extends(Arc::clone(&base))
        .build();

    let session = Arc::new(MemorySession::new(config));
    session.seed_rows("app.BaseMapper.findById", vec![user_row(5, "Eve")]);

    let mapper = MapperFactory::new(child).create(Arc::clone(&session) as Arc<dyn SqlSession>);
    let result = mapper
        .call("findById", vec![Arg::from(5i64)])
        .unwrap()
        .into_value()
        .unwrap();
    assert_eq!(result, user_row(5, "Eve"));

    // the engine saw the ancestor's registered command id
    let call = session.last_call("app.BaseMapper.findById").unwrap();
    assert_eq!(call.operation, "select_one");
}

#[test]
fn test_unregistered_method_fails_naming_it() {
    let config = Arc::new(Configuration::new());
    let interface = MapperInterface::new("app.OrphanMapper")
        .method(MethodDecl::new("orphan").returns(TypeExpr::named("User")))
        .build();
    let session = Arc::new(MemorySession::new(config));
    let factory = MapperFactory::new(interface);
    let mapper = factory.create(session);

    let err = mapper.call("orphan", vec![]).unwrap_err();
    match err {
        BindingError::CommandNotFound(name) => assert_eq!(name, "app.OrphanMapper.orphan"),
        other => panic!("expected CommandNotFound, got {other:?}"),
    }

    // failed compilations are not cached
    assert_eq!(factory.cache().len(), 0);
}

#[test]
fn test_unknown_command_type_fails() {
    let config = Arc::new(Configuration::new().command(CommandDescriptor::new(
        "app.M.broken",
        CommandType::Unknown,
    )));
    let interface = MapperInterface::new("app.M")
        .method(MethodDecl::new("broken").returns(TypeExpr::named("User")))
        .build();
    let mapper = MapperFactory::new(interface).create(Arc::new(MemorySession::new(config)));

    let err = mapper.call("broken", vec![]).unwrap_err();
    assert!(matches!(err, BindingError::UnknownCommandType(id) if id == "app.M.broken"));
}

#[test]
fn test_undeclared_method_fails() {
    let config = Arc::new(Configuration::new());
    let interface = MapperInterface::new("app.M").build();
    let mapper = MapperFactory::new(interface).create(Arc::new(MemorySession::new(config)));

    let err = mapper.call("nope", vec![]).unwrap_err();
    assert!(matches!(err, BindingError::UnknownMethod(..)));
}

#[test]
fn test_duplicate_bounds_surface_on_first_use() {
    let config = Arc::new(Configuration::new().command(CommandDescriptor::new(
        "app.M.paged",
        CommandType::Select,
    )));
    let interface = MapperInterface::new("app.M")
        .method(
            MethodDecl::new("paged")
                .param(ParamDecl::row_bounds())
                .param(ParamDecl::row_bounds())
                .returns(TypeExpr::list(TypeExpr::named("User"))),
        )
        .build();
    // building the proxy is fine, the signature error surfaces at call time
    let mapper = MapperFactory::new(interface).create(Arc::new(MemorySession::new(config)));

    let err = mapper.call("paged", vec![]).unwrap_err();
    assert!(matches!(
        err,
        BindingError::DuplicateSpecialParameter { kind: "row bounds", .. }
    ));
}

#[test]
fn test_generic_ancestor_method_resolves_descendant_element_type() {
    let config = Arc::new(Configuration::new().command(CommandDescriptor::new(
        "app.CrudMapper.findAll",
        CommandType::Select,
    )));
    let base = MapperInterface::new("app.CrudMapper")
        .type_param("T")
        .method(MethodDecl::new("findAll").returns(TypeExpr::list(TypeExpr::var("T"))))
        .build();
    let users = MapperInterface::new("app.UserMapper")
        .extends_with(Arc::clone(&base), vec![TypeExpr::named("User")])
        .build();

    let session = Arc::new(MemorySession::new(config));
    session.seed_rows(
        "app.CrudMapper.findAll",
        vec![user_row(1, "Alice"), user_row(2, "Bob")],
    );

    let mapper = MapperFactory::new(users).create(Arc::clone(&session) as Arc<dyn SqlSession>);
    let result = mapper.call("findAll", vec![]).unwrap().into_value().unwrap();
    let Value::List(rows) = result else {
        panic!("expected a list");
    };
    assert_eq!(rows.len(), 2);
}

#[test]
fn test_default_body_runs_with_proxy_as_receiver() {
    let config = Arc::new(Configuration::new().command(CommandDescriptor::new(
        "app.UserMapper.findAll",
        CommandType::Select,
    )));
    let interface = MapperInterface::new("app.UserMapper")
        .method(MethodDecl::new("findAll").returns(TypeExpr::list(TypeExpr::named("User"))))
        .method(
            MethodDecl::new("findFirstName")
                .returns(TypeExpr::Str)
                .default_body(|mapper, _args| {
                    let all = mapper.call("findAll", vec![])?.into_value()?;
                    let name = match &all {
                        Value::List(rows) => rows
                            .first()
                            .and_then(|r| r.field("name"))
                            .cloned()
                            .unwrap_or(Value::Null),
                        _ => Value::Null,
                    };
                    Ok(CallResult::Value(name))
                }),
        )
        .build();

    let session = Arc::new(MemorySession::new(config));
    session.seed_rows(
        "app.UserMapper.findAll",
        vec![user_row(1, "Alice"), user_row(2, "Bob")],
    );

    let mapper = MapperFactory::new(interface).create(Arc::clone(&session) as Arc<dyn SqlSession>);
    let result = mapper
        .call("findFirstName", vec![])
        .unwrap()
        .into_value()
        .unwrap();
    assert_eq!(result, Value::Text("Alice".to_string()));
}

#[test]
fn test_explicit_names_and_generic_aliases() {
    let config = Arc::new(Configuration::new().command(CommandDescriptor::new(
        "app.UserMapper.rename",
        CommandType::Update,
    )));
    let interface = MapperInterface::new("app.UserMapper")
        .method(
            MethodDecl::new("rename")
                .param(ParamDecl::value("id").explicit("user_id"))
                .param(ParamDecl::value("name"))
                .returns(TypeExpr::Int),
        )
        .build();

    let session = Arc::new(MemorySession::new(config));
    let mapper = MapperFactory::new(interface).create(Arc::clone(&session) as Arc<dyn SqlSession>);
    mapper
        .call("rename", vec![Arg::from(3i64), Arg::from("Carol")])
        .unwrap();

    let call = session.last_call("app.UserMapper.rename").unwrap();
    let Param::Named(map) = call.param else {
        panic!("expected named param");
    };
    assert_eq!(map.get("user_id").unwrap(), &Value::Integer(3));
    assert_eq!(map.get("name").unwrap(), &Value::Text("Carol".to_string()));
    assert_eq!(map.get("param1").unwrap(), &Value::Integer(3));
    assert_eq!(map.get("param2").unwrap(), &Value::Text("Carol".to_string()));
}

#[test]
fn test_positional_names_without_actual_param_name() {
    let config = Arc::new(
        Configuration::new()
            .use_actual_param_name(false)
            .command(CommandDescriptor::new(
                "app.UserMapper.link",
                CommandType::Update,
            )),
    );
    let interface = MapperInterface::new("app.UserMapper")
        .method(
            MethodDecl::new("link")
                .param(ParamDecl::value("from"))
                .param(ParamDecl::value("to"))
                .returns(TypeExpr::Int),
        )
        .build();

    let session = Arc::new(MemorySession::new(config));
    let mapper = MapperFactory::new(interface).create(Arc::clone(&session) as Arc<dyn SqlSession>);
    mapper
        .call("link", vec![Arg::from(1i64), Arg::from(2i64)])
        .unwrap();

    let call = session.last_call("app.UserMapper.link").unwrap();
    let Param::Named(map) = call.param else {
        panic!("expected named param");
    };
    assert_eq!(map.get("0").unwrap(), &Value::Integer(1));
    assert_eq!(map.get("1").unwrap(), &Value::Integer(2));
}

#[test]
fn test_zero_param_method_sends_absent_param() {
    let config = Arc::new(Configuration::new().command(CommandDescriptor::new(
        "app.UserMapper.findAll",
        CommandType::Select,
    )));
    let interface = MapperInterface::new("app.UserMapper")
        .method(MethodDecl::new("findAll").returns(TypeExpr::list(TypeExpr::named("User"))))
        .build();

    let session = Arc::new(MemorySession::new(config));
    let mapper = MapperFactory::new(interface).create(Arc::clone(&session) as Arc<dyn SqlSession>);
    mapper.call("findAll", vec![]).unwrap();

    let call = session.last_call("app.UserMapper.findAll").unwrap();
    assert!(call.param.is_none());
}
