use error_chain::*;

error_chain! {
    errors {
        // Reported to the caller before any cell is mutated, so a failed
        // request never leaves a partially built maze behind.
        InvalidConfiguration(reason: String) {
            description("invalid maze configuration")
            display("invalid maze configuration: {}", reason)
        }
    }
}
