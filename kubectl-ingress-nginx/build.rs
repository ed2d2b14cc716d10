fn main() { let _unused = shadow_rs::ShadowBuilder::builder().build(); }
