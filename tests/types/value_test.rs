use sqlpeek::types::{
    row::Row,
    value::{DataType, Value},
};

#[test]
fn test_as_integer_widens_every_integer_variant() {
    assert_eq!(Value::Int8(-5).as_integer(), Some(-5));
    assert_eq!(Value::Int16(-300).as_integer(), Some(-300));
    assert_eq!(Value::Int24(-8_388_608).as_integer(), Some(-8_388_608));
    assert_eq!(Value::Int32(70_000).as_integer(), Some(70_000));
    assert_eq!(Value::Int48(-1).as_integer(), Some(-1));
    assert_eq!(Value::Int64(i64::MIN).as_integer(), Some(i64::MIN));
    assert_eq!(Value::Flag(false).as_integer(), Some(0));
    assert_eq!(Value::Flag(true).as_integer(), Some(1));
    assert_eq!(Value::Real(1.5).as_integer(), None);
    assert_eq!(Value::Null.as_integer(), None);
}

#[test]
fn test_data_type() {
    assert_eq!(Value::Null.data_type(), DataType::Null);
    assert_eq!(Value::Flag(true).data_type(), DataType::Integer);
    assert_eq!(Value::Int24(3).data_type(), DataType::Integer);
    assert_eq!(Value::Real(0.0).data_type(), DataType::Real);
    assert_eq!(Value::Text("a".to_string()).data_type(), DataType::Text);
    assert_eq!(Value::Blob(vec![]).data_type(), DataType::Blob);
    assert!(Value::Null.is_null());
}

#[test]
fn test_value_display() {
    assert_eq!(Value::Null.to_string(), "NULL");
    assert_eq!(Value::Int8(42).to_string(), "42");
    assert_eq!(Value::Flag(true).to_string(), "1");
    assert_eq!(Value::Real(3.14).to_string(), "3.14");
    assert_eq!(Value::Text("hi".to_string()).to_string(), "hi");
    assert_eq!(Value::Blob(vec![0xDE, 0xAD]).to_string(), "X'DEAD'");
}

#[test]
fn test_row_display_joins_columns() {
    let row = Row::new(
        7,
        vec![Value::Null, Value::Int8(42), Value::Text("hi".to_string())],
    );
    assert_eq!(row.to_string(), "7|NULL|42|hi");
    assert_eq!(row.column_count(), 3);
    assert_eq!(row.column(1), Some(&Value::Int8(42)));
    assert_eq!(row.column(3), None);
}
