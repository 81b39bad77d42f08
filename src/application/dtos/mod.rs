pub mod pagination;
pub mod trash_dto;
