// handlers/elevated/technicians/mod.rs - Technician roster management

pub mod create; // POST /api/admin/techniciens
pub mod delete; // DELETE /api/admin/techniciens/:id
pub mod list;   // GET /api/admin/techniciens
pub mod update; // PUT /api/admin/techniciens/:id
mod utils;

pub use create::technician_create;
pub use delete::technician_delete;
pub use list::technician_list;
pub use update::technician_update;
