//! Asset archive adapters for vidcarve.
//!
//! Game asset archives are opaque to the extractor. An [`AssetStore`] turns
//! one into a list of typed objects; the extractor then asks each video
//! object for a byte blob through [`AssetObject::probe_blob`].
//!
//! [`DumperStore`] is the bundled store. It runs an external dumper and
//! reads a JSON description of the archive from its output.

mod dumper;
pub mod error;
mod object;
mod store;

pub use dumper::DumperStore;
pub use error::{AssetError, Result};
pub use object::{
    AssetArchive, AssetClass, AssetObject, FieldValue, ObjectHandle, ResourceRef,
    DEFAULT_DATA_FIELDS,
};
pub use store::AssetStore;
