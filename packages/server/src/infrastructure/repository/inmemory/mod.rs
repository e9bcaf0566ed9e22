//! インメモリ実装

mod chat_room;

pub use chat_room::InMemoryChatRoomRepository;
