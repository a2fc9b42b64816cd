use sqlchain::{BindValue, IntoValues, StatementBuilder, Values};

#[derive(Values)]
struct NewUser {
    name: String,
    #[column = "user_age"]
    age: i32,
    nickname: Option<String>,
    #[skip]
    #[allow(dead_code)]
    password_confirm: String,
}

#[derive(Values)]
struct Tagged<T> {
    tag: T,
    weight: f64,
}

fn new_user() -> NewUser {
    NewUser {
        name: "Ana".to_string(),
        age: 30,
        nickname: None,
        password_confirm: "secret".to_string(),
    }
}

#[test]
fn test_derive_keeps_declaration_order() {
    let values = new_user().into_column_values();
    let columns: Vec<&str> = values.iter().map(|(c, _)| c.as_str()).collect();
    assert_eq!(columns, ["name", "user_age", "nickname"]);
    assert_eq!(values[0].1, BindValue::from("Ana"));
    assert_eq!(values[1].1, BindValue::Int32(30));
    assert_eq!(values[2].1, BindValue::Null);
}

#[test]
fn test_derive_insert() {
    let stmt = StatementBuilder::new("users")
        .insert(new_user())
        .unwrap()
        .build()
        .unwrap();
    assert_eq!(
        stmt.query,
        "INSERT INTO users (name,user_age,nickname) VALUES (?,?,?)"
    );
    assert_eq!(stmt.params.len(), 3);
}

#[test]
fn test_derive_update() {
    let stmt = StatementBuilder::new("users")
        .update(new_user())
        .unwrap()
        .where_("id", 1)
        .unwrap()
        .build()
        .unwrap();
    assert_eq!(
        stmt.query,
        "UPDATE users SET name = ?, user_age = ?, nickname = ? WHERE id = ?"
    );
    assert_eq!(stmt.params[3], BindValue::from(1));
}

#[test]
fn test_derive_generic_struct() {
    let values = Tagged {
        tag: "blue",
        weight: 0.5,
    }
    .into_column_values();
    assert_eq!(values[0], ("tag".to_string(), BindValue::from("blue")));
    assert_eq!(values[1], ("weight".to_string(), BindValue::Float64(0.5)));
}
