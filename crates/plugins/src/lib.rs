//! Built-in plugins. Everything here goes through the same factory
//! registration as external plugins; nothing is special-cased in the
//! core.

pub mod admin;
pub mod dev;

use burrow_core::PluginSet;

pub use {admin::Admin, dev::Dev};

/// Register the built-in plugin factories under their config names.
pub fn register_defaults(set: &mut PluginSet) {
    set.register("admin", |ctx| Ok(Box::new(Admin::new(ctx)) as Box<dyn burrow_core::Plugin>));
    set.register("dev", |ctx| Ok(Box::new(Dev::new(ctx)) as Box<dyn burrow_core::Plugin>));
}
