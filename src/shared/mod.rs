pub mod fs_atomic;
pub mod ids;
pub mod text;

pub use fs_atomic::atomic_write_file;
pub use ids::{ProjectId, UserId};

pub fn now_secs() -> i64 {
    chrono::Utc::now().timestamp()
}
