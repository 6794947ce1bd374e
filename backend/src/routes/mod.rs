pub mod distribution;
pub mod map;
pub mod selection;
pub mod streets;
pub mod summary;
pub mod vehicles;

