// Platform seam: the filesystem operations the explorer core depends on

pub mod filesystem;
