use std::fmt;

use serde::{Deserialize, Serialize};

/// 机器人零件目录：零件编号 → 型号名称
///
/// 头部和身体共用同一套编号
pub static PART_CATALOG: phf::Map<&'static str, &'static str> = phf::phf_map! {
    "1" => "Roll-a-thor",
    "2" => "Peanut crusher",
    "3" => "D.A.V.E",
    "4" => "Andy Roid",
    "5" => "Spanner mate",
    "6" => "Drillbit 2000",
};

/// 根据零件编号查询型号名称
pub fn part_model(id: &str) -> Option<&'static str> {
    PART_CATALOG.get(id.trim()).copied()
}

/// 一条订单（CSV 中的一行）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// 订单号，批次内唯一，同时作为产物文件名的键
    #[serde(rename = "Order number")]
    pub order_number: String,
    /// 头部零件编号
    #[serde(rename = "Head")]
    pub head: String,
    /// 身体零件编号
    #[serde(rename = "Body")]
    pub body: String,
    /// 腿部零件号（原样填写）
    #[serde(rename = "Legs")]
    pub legs: String,
    /// 收货地址（原样填写）
    #[serde(rename = "Address")]
    pub address: String,
}

/// 订单校验失败原因
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidOrder {
    /// 字段为空
    EmptyField(FormField),
    /// 订单号为空
    EmptyOrderNumber,
    /// 订单号含有不能用于文件名的字符
    UnsafeOrderNumber(String),
    /// 零件编号不在目录中
    UnknownPart { field: FormField, value: String },
}

impl fmt::Display for InvalidOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidOrder::EmptyField(field) => write!(f, "字段 {} 为空", field),
            InvalidOrder::EmptyOrderNumber => write!(f, "订单号为空"),
            InvalidOrder::UnsafeOrderNumber(n) => write!(f, "订单号包含非法字符: {}", n),
            InvalidOrder::UnknownPart { field, value } => {
                write!(f, "字段 {} 的零件编号 {} 不存在", field, value)
            }
        }
    }
}

impl Order {
    /// 校验订单是否可以提交
    pub fn validate(&self) -> Result<(), InvalidOrder> {
        let number = self.order_number.as_str();
        if number.trim().is_empty() {
            return Err(InvalidOrder::EmptyOrderNumber);
        }
        // 订单号会拼进文件名，只拒绝会改变路径或无法落盘的字符
        if number.contains(['/', '\\'])
            || number.contains("..")
            || number.chars().any(char::is_control)
        {
            return Err(InvalidOrder::UnsafeOrderNumber(number.to_string()));
        }

        for field in FormField::ALL {
            if self.value_for(field).trim().is_empty() {
                return Err(InvalidOrder::EmptyField(field));
            }
        }

        for field in [FormField::Head, FormField::Body] {
            let value = self.value_for(field);
            if part_model(value).is_none() {
                return Err(InvalidOrder::UnknownPart {
                    field,
                    value: value.to_string(),
                });
            }
        }

        Ok(())
    }

    /// 取出某个表单字段对应的订单值
    pub fn value_for(&self, field: FormField) -> &str {
        match field {
            FormField::Head => &self.head,
            FormField::Body => &self.body,
            FormField::Legs => &self.legs,
            FormField::Address => &self.address,
        }
    }
}

/// 下单表单上的字段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    Head,
    Body,
    Legs,
    Address,
}

/// 字段的填写方式
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldAction {
    /// 在下拉框中选择
    Select { selector: String },
    /// 点击单选按钮
    Check { selector: String },
    /// 输入文本
    Fill { selector: String },
}

impl FormField {
    /// 按填写顺序排列的全部字段
    pub const ALL: [FormField; 4] = [
        FormField::Head,
        FormField::Body,
        FormField::Legs,
        FormField::Address,
    ];

    /// 字段对应的页面操作
    pub fn action(self, value: &str) -> FieldAction {
        match self {
            FormField::Head => FieldAction::Select {
                selector: "select#head".to_string(),
            },
            FormField::Body => FieldAction::Check {
                selector: format!("input#id-body-{}", value.trim()),
            },
            FormField::Legs => FieldAction::Fill {
                selector: "input[placeholder='Enter the part number for the legs']".to_string(),
            },
            FormField::Address => FieldAction::Fill {
                selector: "input#address".to_string(),
            },
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            FormField::Head => "Head",
            FormField::Body => "Body",
            FormField::Legs => "Legs",
            FormField::Address => "Address",
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(number: &str, head: &str, body: &str) -> Order {
        Order {
            order_number: number.to_string(),
            head: head.to_string(),
            body: body.to_string(),
            legs: "3".to_string(),
            address: "Address 123".to_string(),
        }
    }

    #[test]
    fn test_valid_order() {
        assert_eq!(order("1", "1", "6").validate(), Ok(()));
    }

    #[test]
    fn test_unknown_part_rejected() {
        assert_eq!(
            order("1", "7", "1").validate(),
            Err(InvalidOrder::UnknownPart {
                field: FormField::Head,
                value: "7".to_string()
            })
        );
    }

    #[test]
    fn test_empty_field_rejected() {
        let mut o = order("1", "1", "1");
        o.address = "  ".to_string();
        assert_eq!(o.validate(), Err(InvalidOrder::EmptyField(FormField::Address)));
    }

    #[test]
    fn test_order_number_must_be_file_safe() {
        assert_eq!(
            order("../1", "1", "1").validate(),
            Err(InvalidOrder::UnsafeOrderNumber("../1".to_string()))
        );
        assert_eq!(
            order("a\\b", "1", "1").validate(),
            Err(InvalidOrder::UnsafeOrderNumber("a\\b".to_string()))
        );
        assert_eq!(
            order("7\n", "1", "1").validate(),
            Err(InvalidOrder::UnsafeOrderNumber("7\n".to_string()))
        );
        assert_eq!(order("", "1", "1").validate(), Err(InvalidOrder::EmptyOrderNumber));
    }

    #[test]
    fn test_dotted_and_spaced_order_numbers_accepted() {
        assert_eq!(order("2024.1", "1", "1").validate(), Ok(()));
        assert_eq!(order("A 7", "1", "1").validate(), Ok(()));
    }

    #[test]
    fn test_body_selector_uses_part_id() {
        assert_eq!(
            FormField::Body.action("4"),
            FieldAction::Check {
                selector: "input#id-body-4".to_string()
            }
        );
        assert_eq!(part_model("4"), Some("Andy Roid"));
    }
}
