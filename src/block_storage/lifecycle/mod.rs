//! Create, read, update, and delete operations of the controller.

mod create;
mod delete;
mod read;
mod update;

#[cfg(test)]
mod tests;
