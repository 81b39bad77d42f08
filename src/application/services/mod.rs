pub mod trash_controller;


pub use trash_controller::TrashController;
