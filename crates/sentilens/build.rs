fn main() {
    built::write_built_file().expect("生成构建信息失败");
}
