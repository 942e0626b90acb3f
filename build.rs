fn main() {
    // Propagates ESP-IDF build metadata (link args, include paths) when the
    // firmware image is built for the xtensa target. No-op on host builds.
    embuild::espidf::sysenv::output();
}
