mod create;
mod delete;
mod read;
mod server;
mod update;
