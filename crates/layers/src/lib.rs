pub mod layer;
pub mod memory;
pub mod surface;
pub mod symbology;

pub use layer::*;
pub use memory::InMemoryMap;
pub use surface::*;
pub use symbology::*;
