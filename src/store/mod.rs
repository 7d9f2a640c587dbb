//! Record store and flat-file persistence, split across logical submodules.

mod file;
mod inventory;

pub use file::{
    inventory_file_path, load_records, save_records, LoadError, INVENTORY_FILE_ENV,
    INVENTORY_FILE_NAME,
};
pub use inventory::Inventory;
