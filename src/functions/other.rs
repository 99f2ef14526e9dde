use crate::functions::FunctionTable;

pub fn register(table: &mut FunctionTable) {
    table.register_function("abs", f64::abs);
    table.register_function("ln", f64::ln);
    table.register_function("lg", f64::log10);
    table.register_function("sqrt", f64::sqrt);
}
