/// Enum Variant Strings
#[derive(Debug)]
pub struct EnumVarStrings {
  /// Custom
  pub custom: &'static str,
  /// Identifier
  pub ident: &'static str,
  /// Number
  pub number: &'static str,
}
