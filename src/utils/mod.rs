mod hash;

pub use hash::sha256_file;
