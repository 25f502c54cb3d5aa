//! # codeatlas
//!
//! Structural model extraction for repository documentation.
//!
//! codeatlas reads the source files of a checked-out repository and builds the
//! model a documentation renderer works from:
//!
//! - **Symbol records**: imports, exports, functions, classes, interfaces and
//!   type aliases for every file, with the raw text kept for rendering
//! - **Dependency graph**: files linked through resolved relative imports,
//!   with package imports kept as opaque external nodes
//! - **Graph summaries**: most exported names, longest dependency chains,
//!   most imported targets and circular import groups
//!
//! ## Supported Languages
//!
//! JavaScript (including JSX) and TypeScript (including TSX). Other files are
//! carried as text with size and extension only.

pub mod core;
pub mod formatters;
pub mod parsers;
