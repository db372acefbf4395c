//! Typed table schemas and bounded random data for sql-template-gen.
//!
//! Every [`DataType`] belongs to exactly one [`StorageClass`] and never
//! produces a value outside its declared [`ValueDomain`].
//!
//! # Example
//!
//! ```rust
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//! use sql_datagen::{DataType, Table};
//!
//! let table = Table::new("orders")
//!     .column("id", DataType::Serial)?
//!     .column("active", DataType::Bool)?
//!     .with_row_count(3);
//!
//! let mut rng = ChaCha8Rng::seed_from_u64(42);
//! let data = table.generate_data(&mut rng)?;
//! assert_eq!(data.len(), 2);
//! assert!(data.iter().all(|column| column.len() == 3));
//! # Ok::<(), sql_datagen::Error>(())
//! ```

pub mod data_type;
pub mod error;
pub mod random;
pub mod table;
pub mod value;

pub use data_type::{DataType, StorageClass, ValueDomain};
pub use error::{Error, Result};
pub use table::{Column, Table};
pub use value::{
    generate_column, ColumnData, FixedTemporal, RandomTemporal, SqlValue, TemporalSource,
    ValueGenerator,
};
