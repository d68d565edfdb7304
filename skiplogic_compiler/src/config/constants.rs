pub mod compile_time {
    pub mod logging {
        /// Maximum log message length before truncation
        /// RESOURCE: Bounds memory used by a single event
        pub const MAX_LOG_MESSAGE_LENGTH: usize = 1_000;

        /// Maximum length of a single context value attached to an event
        pub const MAX_CONTEXT_VALUE_LENGTH: usize = 256;

        /// Maximum number of events retained by the in-memory logger
        /// RESOURCE: Older events are dropped once the buffer is full
        pub const MEMORY_LOG_BUFFER_SIZE: usize = 10_000;
    }

    pub mod expressions {
        /// Maximum expression length accepted by the parser
        /// SECURITY: Prevents regex backtracking over pathological input
        pub const MAX_EXPRESSION_LENGTH: usize = 65_536;

        /// Maximum number of criteria in a single parsed rule
        pub const MAX_CRITERIA_PER_RULE: usize = 256;
    }
}
