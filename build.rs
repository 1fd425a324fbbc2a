fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    // Only the ESP-IDF build needs the sysenv exports; host builds skip them.
    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
