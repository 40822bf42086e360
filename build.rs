fn main() {
    // ESP-IDF link arguments are only needed for the firmware image;
    // host builds (`--no-default-features`) skip the toolchain probe.
    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
