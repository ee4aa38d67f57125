//! Identifier types and XML helpers shared between the PubMed and PMC modules

pub mod ids;
pub mod xml;

pub use ids::{PmcId, PubMedId};
pub use xml::XmlElement;
