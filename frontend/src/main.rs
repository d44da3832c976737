mod components;
mod page;
mod services;

fn main() {
    services::logging::init();
    if let Err(err) = page::assemble(&gloo::utils::document()) {
        log::error!("Page setup failed: {:#}", err);
    }
}
