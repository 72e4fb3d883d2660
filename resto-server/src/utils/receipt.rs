//! 小票渲染
//!
//! 纯文本固定宽度小票，列宽与收银机打印纸对齐：
//!
//! ```text
//! ITEM                  QTY   PRICE   TOTAL
//! Latte                     2   4.50    9.00
//! ```

use chrono::Local;

use crate::db::models::Order;

const DIVIDER: &str = "------------------------------------------------";

/// 渲染订单小票
pub fn generate_receipt(order: &Order) -> String {
    let mut lines: Vec<String> = vec![
        "                RESTAURANT MANAGEMENT                ".into(),
        "                123 Restaurant Street                ".into(),
        "                   City, Country                    ".into(),
        "                Tel: (123) 456-7890                 ".into(),
        DIVIDER.into(),
        format!("Order #: {}", order.order_number),
        format!("Date: {}", Local::now().format("%Y-%m-%d %H:%M:%S")),
        format!("Table: {}", order.table),
        format!("Waiter: {}", order.waiter_name),
        DIVIDER.into(),
        "ITEM                  QTY   PRICE   TOTAL".into(),
        DIVIDER.into(),
    ];

    for item in &order.items {
        let unit_price = if item.quantity > 0 {
            item.subtotal / item.quantity as f64
        } else {
            0.0
        };
        lines.push(format!(
            "{:<22}{:>5}{:>7}{:>8}",
            truncate(&item.name, 22),
            item.quantity,
            format!("{:.2}", unit_price),
            format!("{:.2}", item.subtotal),
        ));
    }

    lines.push(DIVIDER.into());
    lines.push(format!("Subtotal:{:>32}", format!("{:.2}", order.subtotal)));
    lines.push(format!("Tax:{:>37}", format!("{:.2}", order.tax)));
    lines.push(format!(
        "Service Charge:{:>27}",
        format!("{:.2}", order.service_charge)
    ));
    lines.push(DIVIDER.into());
    lines.push(format!("TOTAL:{:>35}", format!("{:.2}", order.total)));
    lines.push(DIVIDER.into());
    lines.push(String::new());

    let method = order
        .payment_method
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| "N/A".to_string());
    lines.push(format!("                Payment Method: {}", method));
    lines.push(format!(
        "                Payment Status: {}",
        if order.payment_status { "PAID" } else { "UNPAID" }
    ));
    lines.push(String::new());
    lines.push("            Thank you for dining with us!".into());
    lines.push("                Please come again".into());
    lines.push(DIVIDER.into());

    lines.join("\n")
}

/// 截断超宽菜名，保持列对齐
fn truncate(name: &str, width: usize) -> String {
    if name.chars().count() <= width {
        name.to_string()
    } else {
        name.chars().take(width - 1).collect::<String>() + "…"
    }
}
