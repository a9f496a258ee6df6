pub mod connectivity; // 网络连通性探测
pub mod deep_link; // 深度链接解析
