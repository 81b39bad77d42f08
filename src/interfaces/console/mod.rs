pub mod trash_view;

pub use trash_view::ConsoleTrashView;
