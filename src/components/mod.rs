//! Canvas graph editor and the controls around it.

pub mod edit_modal;
pub mod graph_editor;
pub mod mode_selector;
