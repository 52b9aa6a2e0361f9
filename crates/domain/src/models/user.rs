//! User domain model.

use serde::{Deserialize, Serialize};

/// A persisted user record.
///
/// The wire format keeps the Spanish field names the frontend was built
/// against (`nombre`, `correo`, `edad`); Rust code uses the English names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i32,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "correo")]
    pub email: String,
    #[serde(rename = "edad")]
    pub age: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_serializes_with_wire_field_names() {
        let user = User {
            id: 7,
            name: "Ana".to_string(),
            email: "ana@x.com".to_string(),
            age: 30,
        };
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["nombre"], "Ana");
        assert_eq!(json["correo"], "ana@x.com");
        assert_eq!(json["edad"], 30);
    }

    #[test]
    fn test_user_deserializes_from_wire_field_names() {
        let user: User = serde_json::from_str(
            r#"{"id": 1, "nombre": "Luis", "correo": "luis@x.com", "edad": 41}"#,
        )
        .unwrap();
        assert_eq!(user.id, 1);
        assert_eq!(user.name, "Luis");
        assert_eq!(user.email, "luis@x.com");
        assert_eq!(user.age, 41);
    }

    #[test]
    fn test_user_round_trip() {
        let user = User {
            id: 3,
            name: "Ana Pérez".to_string(),
            email: "ana.perez@example.com".to_string(),
            age: 28,
        };
        let json = serde_json::to_string(&user).unwrap();
        let back: User = serde_json::from_str(&json).unwrap();
        assert_eq!(back, user);
    }
}
