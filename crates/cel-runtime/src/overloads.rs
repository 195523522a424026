//! Stable overload identifiers for the standard library.
//!
//! Type checkers pin these ids into evaluation plans, so the strings are part
//! of the wire-compatible surface and must not change.

// Logic.
pub const CONDITIONAL: &str = "conditional_overload";
pub const LOGICAL_AND: &str = "logical_and_overload";
pub const LOGICAL_OR: &str = "logical_or_overload";
pub const LOGICAL_NOT: &str = "logical_not_overload";
pub const NOT_STRICTLY_FALSE: &str = "not_strictly_false_overload";

// Equality.
pub const EQUALS: &str = "equals_overload";
pub const NOT_EQUALS: &str = "not_equals_overload";

// Less-than.
pub const LESS_BOOL: &str = "less_bool_overload";
pub const LESS_INT64: &str = "less_int64_overload";
pub const LESS_INT64_DOUBLE: &str = "less_int64_double_overload";
pub const LESS_INT64_UINT64: &str = "less_int64_uint64_overload";
pub const LESS_UINT64: &str = "less_uint64_overload";
pub const LESS_UINT64_DOUBLE: &str = "less_uint64_double_overload";
pub const LESS_UINT64_INT64: &str = "less_uint64_int64_overload";
pub const LESS_DOUBLE: &str = "less_double_overload";
pub const LESS_DOUBLE_INT64: &str = "less_double_int64_overload";
pub const LESS_DOUBLE_UINT64: &str = "less_double_uint64_overload";
pub const LESS_STRING: &str = "less_string_overload";
pub const LESS_BYTES: &str = "less_bytes_overload";
pub const LESS_TIMESTAMP: &str = "less_timestamp_overload";
pub const LESS_DURATION: &str = "less_duration_overload";

// Less-or-equal.
pub const LESS_EQUALS_BOOL: &str = "less_equals_bool_overload";
pub const LESS_EQUALS_INT64: &str = "less_equals_int64_overload";
pub const LESS_EQUALS_INT64_DOUBLE: &str = "less_equals_int64_double_overload";
pub const LESS_EQUALS_INT64_UINT64: &str = "less_equals_int64_uint64_overload";
pub const LESS_EQUALS_UINT64: &str = "less_equals_uint64_overload";
pub const LESS_EQUALS_UINT64_DOUBLE: &str = "less_equals_uint64_double_overload";
pub const LESS_EQUALS_UINT64_INT64: &str = "less_equals_uint64_int64_overload";
pub const LESS_EQUALS_DOUBLE: &str = "less_equals_double_overload";
pub const LESS_EQUALS_DOUBLE_INT64: &str = "less_equals_double_int64_overload";
pub const LESS_EQUALS_DOUBLE_UINT64: &str = "less_equals_double_uint64_overload";
pub const LESS_EQUALS_STRING: &str = "less_equals_string_overload";
pub const LESS_EQUALS_BYTES: &str = "less_equals_bytes_overload";
pub const LESS_EQUALS_TIMESTAMP: &str = "less_equals_timestamp_overload";
pub const LESS_EQUALS_DURATION: &str = "less_equals_duration_overload";

// Greater-than.
pub const GREATER_BOOL: &str = "greater_bool_overload";
pub const GREATER_INT64: &str = "greater_int64_overload";
pub const GREATER_INT64_DOUBLE: &str = "greater_int64_double_overload";
pub const GREATER_INT64_UINT64: &str = "greater_int64_uint64_overload";
pub const GREATER_UINT64: &str = "greater_uint64_overload";
pub const GREATER_UINT64_DOUBLE: &str = "greater_uint64_double_overload";
pub const GREATER_UINT64_INT64: &str = "greater_uint64_int64_overload";
pub const GREATER_DOUBLE: &str = "greater_double_overload";
pub const GREATER_DOUBLE_INT64: &str = "greater_double_int64_overload";
pub const GREATER_DOUBLE_UINT64: &str = "greater_double_uint64_overload";
pub const GREATER_STRING: &str = "greater_string_overload";
pub const GREATER_BYTES: &str = "greater_bytes_overload";
pub const GREATER_TIMESTAMP: &str = "greater_timestamp_overload";
pub const GREATER_DURATION: &str = "greater_duration_overload";

// Greater-or-equal.
pub const GREATER_EQUALS_BOOL: &str = "greater_equals_bool_overload";
pub const GREATER_EQUALS_INT64: &str = "greater_equals_int64_overload";
pub const GREATER_EQUALS_INT64_DOUBLE: &str = "greater_equals_int64_double_overload";
pub const GREATER_EQUALS_INT64_UINT64: &str = "greater_equals_int64_uint64_overload";
pub const GREATER_EQUALS_UINT64: &str = "greater_equals_uint64_overload";
pub const GREATER_EQUALS_UINT64_DOUBLE: &str = "greater_equals_uint64_double_overload";
pub const GREATER_EQUALS_UINT64_INT64: &str = "greater_equals_uint64_int64_overload";
pub const GREATER_EQUALS_DOUBLE: &str = "greater_equals_double_overload";
pub const GREATER_EQUALS_DOUBLE_INT64: &str = "greater_equals_double_int64_overload";
pub const GREATER_EQUALS_DOUBLE_UINT64: &str = "greater_equals_double_uint64_overload";
pub const GREATER_EQUALS_STRING: &str = "greater_equals_string_overload";
pub const GREATER_EQUALS_BYTES: &str = "greater_equals_bytes_overload";
pub const GREATER_EQUALS_TIMESTAMP: &str = "greater_equals_timestamp_overload";
pub const GREATER_EQUALS_DURATION: &str = "greater_equals_duration_overload";

// Arithmetic.
pub const ADD_INT64: &str = "add_int64";
pub const ADD_UINT64: &str = "add_uint64";
pub const ADD_DOUBLE: &str = "add_double";
pub const ADD_STRING: &str = "add_string";
pub const ADD_BYTES: &str = "add_bytes";
pub const ADD_LIST: &str = "add_list";
pub const ADD_TIMESTAMP_DURATION: &str = "add_timestamp_duration";
pub const ADD_DURATION_TIMESTAMP: &str = "add_duration_timestamp";
pub const ADD_DURATION_DURATION: &str = "add_duration_duration";
pub const SUBTRACT_INT64: &str = "subtract_int64";
pub const SUBTRACT_UINT64: &str = "subtract_uint64";
pub const SUBTRACT_DOUBLE: &str = "subtract_double";
pub const SUBTRACT_TIMESTAMP_TIMESTAMP: &str = "subtract_timestamp_timestamp";
pub const SUBTRACT_TIMESTAMP_DURATION: &str = "subtract_timestamp_duration";
pub const SUBTRACT_DURATION_DURATION: &str = "subtract_duration_duration";
pub const MULTIPLY_INT64: &str = "multiply_int64";
pub const MULTIPLY_UINT64: &str = "multiply_uint64";
pub const MULTIPLY_DOUBLE: &str = "multiply_double";
pub const DIVIDE_INT64: &str = "divide_int64";
pub const DIVIDE_UINT64: &str = "divide_uint64";
pub const DIVIDE_DOUBLE: &str = "divide_double";
pub const MODULO_INT64: &str = "modulo_int64";
pub const MODULO_UINT64: &str = "modulo_uint64";
pub const NEGATE_INT64: &str = "negate_int64";
pub const NEGATE_DOUBLE: &str = "negate_double";

// Collections.
pub const INDEX_LIST: &str = "index_list";
pub const INDEX_MAP: &str = "index_map";
pub const IN_LIST: &str = "in_list";
pub const IN_MAP: &str = "in_map";
pub const SIZE_STRING: &str = "size_string";
pub const SIZE_BYTES: &str = "size_bytes";
pub const SIZE_LIST: &str = "size_list";
pub const SIZE_MAP: &str = "size_map";
pub const SIZE_STRING_INST: &str = "string_size";
pub const SIZE_BYTES_INST: &str = "bytes_size";
pub const SIZE_LIST_INST: &str = "list_size";
pub const SIZE_MAP_INST: &str = "map_size";

// Conversions.
pub const TYPE_OF: &str = "type";
pub const BOOL_TO_BOOL: &str = "bool_to_bool";
pub const STRING_TO_BOOL: &str = "string_to_bool";
pub const INT_TO_INT: &str = "int_to_int";
pub const UINT_TO_INT: &str = "uint64_to_int64";
pub const DOUBLE_TO_INT: &str = "double_to_int64";
pub const STRING_TO_INT: &str = "string_to_int64";
pub const TIMESTAMP_TO_INT: &str = "timestamp_to_int64";
pub const DURATION_TO_INT: &str = "duration_to_int64";
pub const UINT_TO_UINT: &str = "uint_to_uint";
pub const INT_TO_UINT: &str = "int64_to_uint64";
pub const DOUBLE_TO_UINT: &str = "double_to_uint64";
pub const STRING_TO_UINT: &str = "string_to_uint64";
pub const DURATION_TO_UINT: &str = "duration_to_uint64";
pub const DOUBLE_TO_DOUBLE: &str = "double_to_double";
pub const INT_TO_DOUBLE: &str = "int64_to_double";
pub const UINT_TO_DOUBLE: &str = "uint64_to_double";
pub const STRING_TO_DOUBLE: &str = "string_to_double";
pub const STRING_TO_STRING: &str = "string_to_string";
pub const BOOL_TO_STRING: &str = "bool_to_string";
pub const INT_TO_STRING: &str = "int64_to_string";
pub const UINT_TO_STRING: &str = "uint64_to_string";
pub const DOUBLE_TO_STRING: &str = "double_to_string";
pub const BYTES_TO_STRING: &str = "bytes_to_string";
pub const TIMESTAMP_TO_STRING: &str = "timestamp_to_string";
pub const DURATION_TO_STRING: &str = "duration_to_string";
pub const BYTES_TO_BYTES: &str = "bytes_to_bytes";
pub const STRING_TO_BYTES: &str = "string_to_bytes";
pub const TIMESTAMP_TO_TIMESTAMP: &str = "timestamp_to_timestamp";
pub const STRING_TO_TIMESTAMP: &str = "string_to_timestamp";
pub const INT_TO_TIMESTAMP: &str = "int64_to_timestamp";
pub const DURATION_TO_DURATION: &str = "duration_to_duration";
pub const STRING_TO_DURATION: &str = "string_to_duration";
pub const INT_TO_DURATION: &str = "int64_to_duration";
pub const TO_DYN: &str = "to_dyn";

// Strings.
pub const CONTAINS_STRING: &str = "contains_string";
pub const ENDS_WITH_STRING: &str = "ends_with_string";
pub const STARTS_WITH_STRING: &str = "starts_with_string";
pub const MATCHES: &str = "matches";
pub const MATCHES_STRING: &str = "matches_string";

// Timestamp accessors.
pub const TIMESTAMP_TO_YEAR: &str = "timestamp_to_year";
pub const TIMESTAMP_TO_YEAR_WITH_TZ: &str = "timestamp_to_year_with_tz";
pub const TIMESTAMP_TO_MONTH: &str = "timestamp_to_month";
pub const TIMESTAMP_TO_MONTH_WITH_TZ: &str = "timestamp_to_month_with_tz";
pub const TIMESTAMP_TO_DAY_OF_YEAR: &str = "timestamp_to_day_of_year";
pub const TIMESTAMP_TO_DAY_OF_YEAR_WITH_TZ: &str = "timestamp_to_day_of_year_with_tz";
pub const TIMESTAMP_TO_DAY_OF_MONTH: &str = "timestamp_to_day_of_month";
pub const TIMESTAMP_TO_DAY_OF_MONTH_WITH_TZ: &str = "timestamp_to_day_of_month_with_tz";
pub const TIMESTAMP_TO_DATE: &str = "timestamp_to_day_of_month_1_based";
pub const TIMESTAMP_TO_DATE_WITH_TZ: &str = "timestamp_to_day_of_month_1_based_with_tz";
pub const TIMESTAMP_TO_DAY_OF_WEEK: &str = "timestamp_to_day_of_week";
pub const TIMESTAMP_TO_DAY_OF_WEEK_WITH_TZ: &str = "timestamp_to_day_of_week_with_tz";
pub const TIMESTAMP_TO_HOURS: &str = "timestamp_to_hours";
pub const TIMESTAMP_TO_HOURS_WITH_TZ: &str = "timestamp_to_hours_with_tz";
pub const TIMESTAMP_TO_MINUTES: &str = "timestamp_to_minutes";
pub const TIMESTAMP_TO_MINUTES_WITH_TZ: &str = "timestamp_to_minutes_with_tz";
pub const TIMESTAMP_TO_SECONDS: &str = "timestamp_to_seconds";
pub const TIMESTAMP_TO_SECONDS_WITH_TZ: &str = "timestamp_to_seconds_with_tz";
pub const TIMESTAMP_TO_MILLISECONDS: &str = "timestamp_to_milliseconds";
pub const TIMESTAMP_TO_MILLISECONDS_WITH_TZ: &str = "timestamp_to_milliseconds_with_tz";

// Duration accessors.
pub const DURATION_TO_HOURS: &str = "duration_to_hours";
pub const DURATION_TO_MINUTES: &str = "duration_to_minutes";
pub const DURATION_TO_SECONDS: &str = "duration_to_seconds";
pub const DURATION_TO_MILLISECONDS: &str = "duration_to_milliseconds";
