use minikt::environment::Environment;
use minikt::errors::EvalError;
use minikt::primitive::Primitive;
use proptest::prelude::*;

proptest! {
    #[test]
    fn get_returns_what_was_set(name in "[A-Za-z_][A-Za-z0-9_]{0,12}", value in any::<i64>()) {
        let mut environment = Environment::new();
        environment.declare_or_set(&name, Primitive::Integer(value)).unwrap();
        prop_assert_eq!(environment.get(&name), Ok(Primitive::Integer(value)));
    }

    #[test]
    fn invalid_names_leave_bindings_alone(
        prefix in "[0-9]",
        rest in "[A-Za-z0-9_ ]{0,8}",
        value in any::<i64>(),
    ) {
        let mut environment = Environment::new();
        environment.declare_or_set("kept", Primitive::Integer(7)).unwrap();

        let name = format!("{}{}", prefix, rest);
        prop_assert_eq!(
            environment.declare_or_set(&name, Primitive::Integer(value)),
            Err(EvalError::InvalidName(name.clone()))
        );
        prop_assert_eq!(environment.snapshot(), vec![("kept".to_string(), Primitive::Integer(7))]);
    }

    #[test]
    fn names_with_spaces_are_rejected(left in "[a-z]{1,5}", right in "[a-z]{1,5}") {
        let mut environment = Environment::new();
        let name = format!("{} {}", left, right);
        prop_assert!(environment.declare_or_set(&name, Primitive::Integer(1)).is_err());
        prop_assert!(environment.is_empty());
    }
}
