use crate::functions::FunctionTable;

pub fn register(table: &mut FunctionTable) {
    table.register_function("sinh", f64::sinh);
    table.register_function("cosh", f64::cosh);
    table.register_function("tanh", f64::tanh);
}
