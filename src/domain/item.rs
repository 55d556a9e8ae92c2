use super::store::{Entity, MemoryStore};
use serde::Serialize;

/// A catalogue item. `price` and `quantity` stay optional so a form that
/// failed validation can be echoed back as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: u64,
    pub item_name: String,
    pub price: Option<i64>,
    pub quantity: Option<i64>,
}

impl Item {
    pub fn new(item_name: impl Into<String>, price: i64, quantity: i64) -> Self {
        Self {
            id: 0,
            item_name: item_name.into(),
            price: Some(price),
            quantity: Some(quantity),
        }
    }
}

impl Entity for Item {
    const NAME: &'static str = "item";

    fn id(&self) -> u64 {
        self.id
    }

    fn set_id(&mut self, id: u64) {
        self.id = id;
    }
}

pub type ItemRepository = MemoryStore<Item>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_serializes_camel_case() {
        let item = Item::new("itemA", 10_000, 10);
        assert_eq!(
            serde_json::to_value(&item).unwrap(),
            json!({ "id": 0, "itemName": "itemA", "price": 10000, "quantity": 10 })
        );
    }
}
