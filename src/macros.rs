/// Builds a [`DataNode`](crate::DataNode) from tokens and, after a `;`, child nodes.
///
/// Tokens may be anything implementing [`Token`](crate::Token): string
/// slices, `String`s, integers and floats.
///
/// # Examples
///
/// ```rust
/// use skyfile::node;
///
/// let arrival = node!["arrival"; node!["link", 500], node!["jump", 300.5]];
/// assert_eq!(arrival.keyword(), "arrival");
/// assert_eq!(arrival.children()[1].token(1), "300.5");
///
/// let name = String::from("Sol");
/// let system = node!["system", name; node!["pos", 0, 0]];
/// assert_eq!(system.token(1), "Sol");
/// ```
#[macro_export]
macro_rules! node {
    ($($token:expr),+ ; $($child:expr),* $(,)?) => {{
        let mut node = $crate::node![$($token),+];
        $(
            node.push_child($child);
        )*
        node
    }};

    ($($token:expr),+ $(,)?) => {{
        let mut node = $crate::DataNode::default();
        $(
            node.push_token($crate::Token::to_token(&$token).into_owned());
        )+
        node
    }};
}
