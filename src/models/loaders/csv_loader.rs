use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use crate::error::{AppError, AppResult, SourceError};
use crate::models::order::Order;

/// 从任意 reader 解析订单
///
/// 表头必须精确包含 `Order number, Head, Body, Legs, Address`，多余的列会被忽略。
/// 只去掉表头两端的空白，单元格原样保留。订单顺序与 CSV 行顺序一致。
pub fn parse_orders<R: Read>(reader: R) -> AppResult<Vec<Order>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let mut orders = Vec::new();
    let mut seen = HashSet::new();

    for record in csv_reader.deserialize::<Order>() {
        let order = record?;
        if !seen.insert(order.order_number.clone()) {
            return Err(SourceError::DuplicateOrderNumber(order.order_number).into());
        }
        orders.push(order);
    }

    Ok(orders)
}

/// 从 CSV 文件加载订单
pub fn load_orders_from_csv(csv_path: &Path) -> AppResult<Vec<Order>> {
    let file = std::fs::File::open(csv_path).map_err(|e| AppError::file(csv_path, e))?;
    let orders = parse_orders(file)?;
    tracing::info!("从 {} 读取到 {} 条订单", csv_path.display(), orders.len());
    Ok(orders)
}
