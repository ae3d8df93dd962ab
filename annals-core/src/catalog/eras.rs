use super::Era;

pub static BUILTIN_ERAS: &[Era] = &[
    Era {
        id: "xia",
        name: "Xia Dynasty",
        localized_name: "夏朝",
        period: "约公元前2070年 - 前1600年",
        summary: "传说中的第一个世袭王朝，大禹治水的故事由此流传。",
        image_url: "https://picsum.photos/seed/xia/800/600",
    },
    Era {
        id: "shang",
        name: "Shang Dynasty",
        localized_name: "商朝",
        period: "约公元前1600年 - 前1046年",
        summary: "青铜铸造与甲骨文的时代，中国有文字记载历史的开端。",
        image_url: "https://picsum.photos/seed/shang/800/600",
    },
    Era {
        id: "zhou",
        name: "Zhou Dynasty",
        localized_name: "周朝",
        period: "公元前1046年 - 前256年",
        summary: "礼乐与分封的王朝，春秋战国百家争鸣，孔子与老子皆生于此时。",
        image_url: "https://picsum.photos/seed/zhou/800/600",
    },
    Era {
        id: "qin",
        name: "Qin Dynasty",
        localized_name: "秦朝",
        period: "公元前221年 - 前207年",
        summary: "第一个大一统帝国，统一文字、度量衡，修筑长城。",
        image_url: "https://picsum.photos/seed/qin/800/600",
    },
    Era {
        id: "han",
        name: "Han Dynasty",
        localized_name: "汉朝",
        period: "公元前202年 - 公元220年",
        summary: "丝绸之路开通，儒学成为官方正统，汉民族由此得名。",
        image_url: "https://picsum.photos/seed/han/800/600",
    },
    Era {
        id: "three-kingdoms",
        name: "Three Kingdoms",
        localized_name: "三国",
        period: "公元220年 - 280年",
        summary: "魏、蜀、吴三分天下，英雄辈出的乱世。",
        image_url: "https://picsum.photos/seed/three-kingdoms/800/600",
    },
    Era {
        id: "jin",
        name: "Jin Dynasty",
        localized_name: "晋朝",
        period: "公元266年 - 420年",
        summary: "短暂统一后南迁，玄学兴盛，书法艺术登峰造极。",
        image_url: "https://picsum.photos/seed/jin/800/600",
    },
    Era {
        id: "sui",
        name: "Sui Dynasty",
        localized_name: "隋朝",
        period: "公元581年 - 618年",
        summary: "重新统一南北，开凿大运河，创立科举制度。",
        image_url: "https://picsum.photos/seed/sui/800/600",
    },
    Era {
        id: "tang",
        name: "Tang Dynasty",
        localized_name: "唐朝",
        period: "公元618年 - 907年",
        summary: "开放包容的盛世，诗歌的黄金时代，长安是世界性的大都会。",
        image_url: "https://picsum.photos/seed/tang/800/600",
    },
    Era {
        id: "song",
        name: "Song Dynasty",
        localized_name: "宋朝",
        period: "公元960年 - 1279年",
        summary: "商业与科技繁荣，活字印刷、指南针和火药广泛应用。",
        image_url: "https://picsum.photos/seed/song/800/600",
    },
    Era {
        id: "yuan",
        name: "Yuan Dynasty",
        localized_name: "元朝",
        period: "公元1271年 - 1368年",
        summary: "蒙古人建立的王朝，疆域空前辽阔，元曲盛行。",
        image_url: "https://picsum.photos/seed/yuan/800/600",
    },
    Era {
        id: "ming",
        name: "Ming Dynasty",
        localized_name: "明朝",
        period: "公元1368年 - 1644年",
        summary: "郑和下西洋，紫禁城落成，长城大规模重修。",
        image_url: "https://picsum.photos/seed/ming/800/600",
    },
    Era {
        id: "qing",
        name: "Qing Dynasty",
        localized_name: "清朝",
        period: "公元1644年 - 1912年",
        summary: "最后一个帝制王朝，康乾盛世之后走向近代变局。",
        image_url: "https://picsum.photos/seed/qing/800/600",
    },
];
