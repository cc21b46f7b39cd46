//! Reading and writing raster stacks

mod tiff_io;

pub use tiff_io::{
    read_factor_tiff, read_factor_tiff_from_buffer, read_raster_tiff, write_factor_tiff,
    write_factor_tiff_to_buffer, write_raster_tiff,
};
