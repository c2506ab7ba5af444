fn main() {
    slint_build::compile("ui/app_window.slint").expect("Slint 界面编译失败");
}
