//! Shared fixture: a small table dump covering every value kind.

use btcli::MemoryBigtable;

pub const DUMP: &str = r#"{ "tables": {
    "users": [
        { "key": "1",  "cells": [ { "family": "d", "qualifier": "d:row", "value": "one" } ] },
        { "key": "10", "cells": [ { "family": "d", "qualifier": "d:row", "value": "ten" } ] },
        { "key": "19", "cells": [ { "family": "d", "qualifier": "d:row", "value": "nineteen" } ] },
        { "key": "2",  "cells": [ { "family": "d", "qualifier": "d:row", "value": "two" } ] },
        { "key": "a", "cells": [
            { "family": "d",  "qualifier": "d:row", "value": "a1", "timestamp_micros": 1000000 },
            { "family": "d",  "qualifier": "d:row", "value": "a2", "timestamp_micros": 2000000 },
            { "family": "d",  "qualifier": "d:row", "value": "a3", "timestamp_micros": 3000000 },
            { "family": "dd", "qualifier": "dd:x",  "value": "wide" }
        ] },
        { "key": "b", "cells": [
            { "family": "d", "qualifier": "d:n", "value": { "int": 42 } },
            { "family": "d", "qualifier": "d:f", "value": { "float": 2.0 } }
        ] },
        { "key": "c", "cells": [ { "family": "d", "qualifier": "d:row", "value": "c1" } ] }
    ],
    "empty": []
} }"#;

pub fn fixture() -> MemoryBigtable {
    MemoryBigtable::from_reader(DUMP.as_bytes()).unwrap()
}
