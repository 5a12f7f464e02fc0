// Treemarks stateless services
// Services hold no cursor or cache: the tree codec and the import/export document.

pub mod export_service;
pub mod tree_codec;
