/// Process exit codes of the `reclaim` binary.
pub mod exit {
    pub const SUCCESS: i32 = 0;
    /// At least one action reported failure.
    pub const ACTION_FAILURE: i32 = 1;
}
