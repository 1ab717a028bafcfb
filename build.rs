fn main() {
    // Only the ESP-IDF build needs the toolchain environment forwarded; host
    // builds (unit tests) have nothing to emit.
    if std::env::var("CARGO_CFG_TARGET_OS").as_deref() == Ok("espidf") {
        embuild::espidf::sysenv::output();
    }
}
