// Utility Module
// File persistence for keys, ciphertexts and plaintexts

pub mod file_ops;

pub use file_ops::{load_ciphertext, load_key, load_plaintext, save_ciphertext, save_key, save_plaintext};
