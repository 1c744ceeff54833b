//! Export module for saving terrain meshes and heightmaps.
//!
//! Supports Wavefront OBJ and JSON for meshes, 16-bit PNG and RAW
//! formats for plain heightmaps.

mod json;
mod obj;
mod png;
mod raw;

pub use json::{export_mesh_json, JsonExportError};
pub use obj::{export_mesh_obj, write_mesh_obj, ObjExportError, ObjExportOptions};
pub use png::{export_mesh_png, PngExportError, PngExportOptions};
pub use raw::{expected_file_size, export_mesh_raw, RawExportError, RawFormat};
