mod stores;

pub use stores::Stores;
