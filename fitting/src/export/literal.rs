//! C++ table literal

use crate::table::LtcTable;
use std::fmt::Write as FmtWrite;
use std::fs;

/// Default qualified name of the table variable.
pub const DEFAULT_TABLE_NAME: &str = "SheenLTC::_ltcParamTableSingleSGGX";

/// Number of entries per line.
const ENTRIES_PER_LINE: usize = 3;

/// Returns the table as a C++ definition of a `Vector3f` array indexed by
/// `[alpha_idx][mu_idx]` that can be pasted into the renderer sources.
///
/// * `table` - The table.
/// * `name`  - Qualified name of the array.
pub fn format_cpp_table(table: &LtcTable, name: &str) -> String {
    let (mu_res, alpha_res, _) = table.shape();

    let mut s = String::new();
    let _ = writeln!(s, "const Vector3f {name}[{alpha_res}][{mu_res}] = {{");
    for alpha_idx in 0..alpha_res {
        s.push_str("    {\n");

        for mu_idx in 0..mu_res {
            if mu_idx % ENTRIES_PER_LINE == 0 {
                s.push_str("        ");
            }

            let p = table.get(mu_idx, alpha_idx);
            let _ = write!(s, "Vector3f({:.5}, {:.5}, {:.5})", p.a, p.b, p.r);
            s.push_str(if mu_idx < mu_res - 1 { ", " } else { "\n" });

            if mu_idx % ENTRIES_PER_LINE == ENTRIES_PER_LINE - 1 {
                s.push('\n');
            }
        }

        s.push_str("    }");
        s.push_str(if alpha_idx < alpha_res - 1 { ",\n" } else { "\n" });
    }
    s.push_str("};\n");
    s
}

/// Write the table as a C++ literal.
///
/// * `path`  - Output file path.
/// * `table` - The table.
/// * `name`  - Qualified name of the array.
pub fn write_cpp(path: &str, table: &LtcTable, name: &str) -> Result<(), String> {
    info!("Writing C++ table {name} to {path}");
    fs::write(path, format_cpp_table(table, name)).map_err(|e| format!("write_cpp(): Error writing '{path}': {e}"))
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
