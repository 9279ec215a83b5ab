//! Record access facade against a scripted executor.

mod common;

use common::{init_logging, Customer, Invoice, Setting};
use mooring::access::crud;
use mooring::test_helpers::ScriptedExecutor;
use mooring::{ExecError, Mapped, MappingConfig, MappingError, Operation, Row, Value};
use rust_decimal::Decimal;
use std::sync::Arc;

fn mapped<R: mooring::Record>(record: R) -> Mapped<R> {
    Mapped::with_config(record, Arc::new(MappingConfig::default()))
}

#[test]
fn test_add_record_assigns_identity() {
    init_logging();
    let db = ScriptedExecutor::new().with_scalar(Ok(42));
    let mut customer = mapped(Customer {
        Name: "Ada".into(),
        ..Customer::default()
    });

    assert!(customer.add_record(&db));
    assert_eq!(customer.id_Customer, 42);
    assert!(customer.last_error().is_none());
    assert_eq!(db.executed().len(), 1);
}

#[test]
fn test_add_record_without_identity_sets_sentinel() {
    let db = ScriptedExecutor::new().with_scalar(Ok(0));
    let mut customer = mapped(Customer::default());

    assert!(!customer.add_record(&db));
    assert_eq!(customer.id_Customer, -1);
    let err = customer.last_error().unwrap();
    assert_eq!(err.operation, Operation::Add);
    assert_eq!(err.entity, "Customer");
    assert!(err.to_string().contains("no new identity returned"));
}

#[test]
fn test_add_record_with_caller_supplied_key() {
    let db = ScriptedExecutor::new().with_non_query(Ok(1));
    let mut setting = mapped(Setting {
        SettingKey: "theme".into(),
        Payload: "dark".into(),
    });
    assert!(setting.add_record(&db));
    assert_eq!(setting.SettingKey, "theme");
    assert_eq!(
        db.last_sql().as_deref(),
        Some("INSERT INTO tblSettings ([SettingKey], [Payload]) VALUES ('theme', 'dark')")
    );
}

#[test]
fn test_update_record_zero_rows_fails() {
    let db = ScriptedExecutor::new().with_non_query(Ok(0));
    let mut customer = mapped(Customer {
        id_Customer: 5,
        ..Customer::default()
    });
    assert!(!customer.update_record(&db));
    let err = customer.last_error().unwrap();
    assert!(err.to_string().contains("no record was updated"));
    assert_eq!(
        err.error,
        MappingError::ZeroRowsAffected {
            operation: Operation::Update
        }
    );
}

#[test]
fn test_delete_record() {
    let db = ScriptedExecutor::new().with_non_query(Ok(1)).with_non_query(Ok(0));
    let mut customer = mapped(Customer {
        id_Customer: 5,
        ..Customer::default()
    });
    assert!(customer.delete_record(&db));
    assert!(!customer.delete_record(&db));
    assert!(customer
        .last_error()
        .unwrap()
        .to_string()
        .contains("no record was deleted"));
    assert_eq!(
        db.executed(),
        vec![
            "DELETE FROM Customer WHERE Customer.[id_Customer] = 5",
            "DELETE FROM Customer WHERE Customer.[id_Customer] = 5",
        ]
    );
}

#[test]
fn test_select_zero_rows_is_not_an_error() {
    let db = ScriptedExecutor::new();
    let mut customer = mapped(Customer::default());
    let found = customer.select_where_order_by(&db, "", "Name");
    assert!(found.is_empty());
    assert!(customer.last_error().is_none());
    assert!(db.last_sql().unwrap().ends_with("FROM Customer ORDER BY Name"));
}

#[test]
fn test_select_hydrates_in_row_order() {
    let rows = vec![
        Row::new()
            .with("id_Customer", 1)
            .with("Name", "Ada")
            .with("Born", Value::DateTime(None))
            .with("Balance", Value::Decimal(None))
            .with("Active", true),
        Row::new()
            .with("ID_CUSTOMER", Value::BigInt(Some(2)))
            .with("name", "Grace")
            .with("Born", Value::DateTime(None))
            .with("Balance", Decimal::from(3))
            .with("Active", false),
    ];
    let db = ScriptedExecutor::new().with_rows(rows);
    let mut probe = mapped(Customer::default());
    let found = probe.select_all(&db, "");

    assert_eq!(found.len(), 2);
    assert_eq!(found[0].Name, "Ada");
    assert_eq!(found[0].Balance, Decimal::ZERO);
    assert_eq!(found[1].id_Customer, 2);
    assert_eq!(found[1].Balance, Decimal::from(3));
    assert!(!found[1].Active);
}

#[test]
fn test_select_reports_execution_failure() {
    let db = ScriptedExecutor::new().with_query_error(ExecError::Query("Invalid object name".into()));
    let mut customer = mapped(Customer::default());
    assert!(customer.select_all(&db, "").is_empty());
    let err = customer.last_error().unwrap();
    assert_eq!(err.operation, Operation::Select);
    assert!(err.statement.as_deref().unwrap().starts_with("SELECT "));
    assert!(err.to_string().contains("Invalid object name"));
}

#[test]
fn test_select_by_primary_key() {
    let row = Row::new()
        .with("id_Customer", 9)
        .with("Name", "Linus")
        .with("Born", Value::DateTime(None))
        .with("Balance", Decimal::from(1))
        .with("Active", true);
    let db = ScriptedExecutor::new().with_rows(vec![row]);
    let mut probe = mapped(Customer::default());

    let found = probe.select_by_primary_key(&db, 9).unwrap();
    assert_eq!(found.Name, "Linus");
    assert!(db.last_sql().unwrap().ends_with("WHERE Customer.[id_Customer] = 9"));

    assert!(probe.select_by_primary_key(&db, 10).is_none());
    assert!(probe.last_error().is_none());
}

#[test]
fn test_reference_without_join_key_fails_select() {
    #[allow(non_snake_case)]
    #[derive(Debug, Default, mooring::Record)]
    struct Loose {
        id_Loose: i32,
        ref_Region_Name: Option<String>,
    }

    let db = ScriptedExecutor::new();
    let mut loose = mapped(Loose::default());
    assert!(loose.select_all(&db, "").is_empty());
    assert!(matches!(
        loose.last_error().map(|e| &e.error),
        Some(MappingError::InvalidReference { .. })
    ));
    assert!(db.executed().is_empty());
}

#[test]
fn test_reference_join_is_issued() {
    let db = ScriptedExecutor::new();
    let mut invoice = mapped(Invoice::default());
    invoice.select_all(&db, "");
    assert!(db
        .last_sql()
        .unwrap()
        .contains("LEFT JOIN Orders ON Invoice.[Orders_id] = Orders.[Orders_id]"));
}

#[test]
fn test_parameterized_writes() {
    let cfg = MappingConfig {
        parameterize_writes: true,
        ..MappingConfig::default()
    };
    let db = ScriptedExecutor::parameterized()
        .with_scalar(Ok(77))
        .with_non_query(Ok(1));
    let mut customer = Mapped::with_config(
        Customer {
            Name: "Ada".into(),
            ..Customer::default()
        },
        Arc::new(cfg),
    );

    assert!(customer.add_record(&db));
    assert_eq!(customer.id_Customer, 77);
    assert!(customer.update_record(&db));

    let statements = db.statements();
    assert_eq!(statements.len(), 2);
    assert!(statements[0].sql.starts_with("INSERT INTO Customer ([Name], [Born], [Balance], [Active]) VALUES (@p1, @p2, @p3, @p4)"));
    assert_eq!(statements[1].params.last(), Some(&Value::Int(Some(77))));
    assert!(db.executed().is_empty());
}

#[test]
fn test_parameterized_writes_need_executor_support() {
    let cfg = MappingConfig {
        parameterize_writes: true,
        ..MappingConfig::default()
    };
    let db = ScriptedExecutor::new();
    let mut customer = Mapped::with_config(Customer::default(), Arc::new(cfg));
    assert!(!customer.delete_record(&db));
    assert!(matches!(
        customer.last_error().map(|e| &e.error),
        Some(MappingError::Execution(ExecError::Unsupported(_)))
    ));
}

#[test]
fn test_crud_functions_work_through_a_borrowed_executor() {
    let db = ScriptedExecutor::new().with_scalar(Ok(3));
    let tx: &dyn mooring::Executor = &db;
    let mut customer = Customer::default();
    let id = crud::insert(&tx, &mut customer, &MappingConfig::default()).unwrap();
    assert_eq!(id, Some(3));
    assert_eq!(customer.id_Customer, 3);
}
