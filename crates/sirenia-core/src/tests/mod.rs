mod config;
mod data;
mod format;
mod palette;
mod tooltip;
