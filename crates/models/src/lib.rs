pub mod db;
pub mod blob_record;
pub mod value_set;
pub mod value_row;
