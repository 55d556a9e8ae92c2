use super::store::{Entity, MemoryStore};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Member {
    pub id: u64,
    pub username: String,
    pub age: u32,
}

impl Member {
    /// A member not yet saved (id 0).
    pub fn new(username: impl Into<String>, age: u32) -> Self {
        Self {
            id: 0,
            username: username.into(),
            age,
        }
    }
}

impl Entity for Member {
    const NAME: &'static str = "member";

    fn id(&self) -> u64 {
        self.id
    }

    fn set_id(&mut self, id: u64) {
        self.id = id;
    }
}

pub type MemberRepository = MemoryStore<Member>;
