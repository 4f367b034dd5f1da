// Adapters layer: concrete implementations of the domain ports (roster
// sources, greeting senders, storage backends).

pub mod senders;
pub mod sources;
pub mod storage;
