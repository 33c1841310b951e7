pub mod engine;
pub mod sweeper;

pub use engine::{
    delete_empty_folders, delete_with_report, DeleteOptions, DeleteReport, DirOps, RealDirOps,
    DONE_LABEL,
};
pub use sweeper::delete_known_garbage;
