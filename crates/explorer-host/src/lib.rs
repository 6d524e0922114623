// Host filesystem implementation backed by std::fs

pub mod filesystem;

pub use filesystem::HostFileSystem;
