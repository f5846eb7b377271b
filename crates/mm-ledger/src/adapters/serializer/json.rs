use crate::domain::errors::SerializationError;
use crate::ports::outbound::RecordSerializer;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Record codec using `serde_json`.
///
/// Stored records and query responses share the same encoding, so a query
/// payload is exactly what a client would decode from the store.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonRecordSerializer;

impl JsonRecordSerializer {
    pub fn new() -> Self {
        Self
    }
}

impl RecordSerializer for JsonRecordSerializer {
    fn serialize<T: Serialize>(&self, record: &T) -> Result<Vec<u8>, SerializationError> {
        serde_json::to_vec(record).map_err(|e| SerializationError::new(e.to_string()))
    }

    fn deserialize<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, SerializationError> {
        serde_json::from_slice(data).map_err(|e| SerializationError::new(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{Account, Property, Trade};
    use crate::domain::value_objects::Direction;
    use crate::test_utils::{amount, oakwood_property};

    #[test]
    fn test_records_survive_encoding() {
        let codec = JsonRecordSerializer::new();

        let mut property = oakwood_property("cardy", 10_000);
        property.id = "0123456789abcdef0123456789abcdef".into();
        let decoded: Property = codec.deserialize(&codec.serialize(&property).unwrap()).unwrap();
        assert_eq!(decoded, property);

        let mut account = Account::new("alice");
        account.deposit(amount("1000.25")).unwrap();
        account.change_holding(&property.id, 7).unwrap();
        let decoded: Account = codec.deserialize(&codec.serialize(&account).unwrap()).unwrap();
        assert_eq!(decoded, account);

        let trade = Trade {
            id: "t1".into(),
            account_id: "alice".into(),
            property_id: property.id.clone(),
            direction: Direction::Sell,
            price: amount("99.95"),
            units: 3,
            escrow: amount("10"),
        };
        let decoded: Trade = codec.deserialize(&codec.serialize(&trade).unwrap()).unwrap();
        assert_eq!(decoded, trade);
    }

    #[test]
    fn test_money_accepts_numbers_and_strings() {
        let codec = JsonRecordSerializer::new();
        let from_number: Account = codec
            .deserialize(br#"{"id":"alice","cash":12.5}"#)
            .unwrap();
        let from_string: Account = codec
            .deserialize(br#"{"id":"alice","cash":"12.5"}"#)
            .unwrap();
        assert_eq!(from_number.cash, amount("12.5"));
        assert_eq!(from_number, from_string);
    }

    #[test]
    fn test_malformed_input() {
        let codec = JsonRecordSerializer::new();
        let err = codec.deserialize::<Property>(b"{not json").unwrap_err();
        assert!(!err.message.is_empty());
    }
}
