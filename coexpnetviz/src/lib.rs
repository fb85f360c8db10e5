pub mod analyser;
pub mod colour;
pub mod common;
pub mod correlation;
pub mod cytoscape;
pub mod edges;
pub mod error;
pub mod expression;
pub mod families;
pub mod input;
pub mod network;
pub mod nodes;
pub mod output;
pub mod plot;
pub mod run;
pub mod validate;
